//! Conversion between the two persisted delta schemas.
//!
//! v1 stores text runs as bare strings, v2 boxes them as `{"text": ...}`.
//! Both directions build a new delta and leave the input alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DeltaError;
use crate::model::{Delta, Insert, Op};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V1,
    V2,
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVersion::V1 => f.write_str("v1"),
            SchemaVersion::V2 => f.write_str("v2"),
        }
    }
}

impl Delta {
    /// Box every text run. Embeds pass through untouched.
    pub fn to_v2(&self) -> Delta {
        self.iter().map(op_to_v2).collect()
    }

    /// Unbox every boxed text run, and drop `image` keys whose value is null.
    pub fn to_v1(&self) -> Delta {
        self.iter().map(op_to_v1).collect()
    }

    pub fn migrate(&self, to: SchemaVersion) -> Delta {
        match to {
            SchemaVersion::V1 => self.to_v1(),
            SchemaVersion::V2 => self.to_v2(),
        }
    }
}

fn op_to_v2(op: &Op) -> Op {
    match &op.insert {
        Insert::Text(text) => Op {
            insert: Insert::BoxedText(text.clone()),
            attributes: op.attributes.clone(),
        },
        _ => op.clone(),
    }
}

fn op_to_v1(op: &Op) -> Op {
    let insert = match &op.insert {
        Insert::BoxedText(text) => Insert::Text(text.clone()),
        Insert::Embed(map) if map.get("image") == Some(&Value::Null) => {
            let mut map = map.clone();
            map.shift_remove("image");
            Insert::Embed(map)
        }
        other => other.clone(),
    };
    Op {
        insert,
        attributes: op.attributes.clone(),
    }
}

/// Migrate a raw JSON delta. `null` becomes an empty delta; structurally
/// malformed input is an error.
pub fn migrate_value(value: Value, to: SchemaVersion) -> Result<Delta, DeltaError> {
    let delta = Delta::from_value(value)?;
    tracing::debug!(ops = delta.len(), %to, "migrating delta");
    Ok(delta.migrate(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attributes;
    use serde_json::json;

    fn sample_v1() -> Delta {
        Delta::from(vec![
            Op::styled(
                "bold",
                Attributes {
                    bold: Some(true),
                    ..Default::default()
                },
            ),
            Op::image("http://x/a.png"),
            Op::text("tail\n"),
        ])
    }

    #[test]
    fn test_v1_to_v2_boxes_text() {
        let v2 = sample_v1().to_v2();
        assert_eq!(v2.ops[0].insert, Insert::BoxedText("bold".into()));
        assert!(v2.ops[0].attributes.as_ref().unwrap().is_bold());
        assert_eq!(v2.ops[1], Op::image("http://x/a.png"));
        assert_eq!(
            serde_json::to_value(&v2.ops[2]).unwrap(),
            json!({"insert": {"text": "tail\n"}})
        );
    }

    #[test]
    fn test_round_trips() {
        let v1 = sample_v1();
        assert_eq!(v1.to_v2().to_v1(), v1);

        let v2 = v1.to_v2();
        assert_eq!(v2.to_v1().to_v2(), v2);
    }

    #[test]
    fn test_input_is_untouched() {
        let v1 = sample_v1();
        let before = v1.clone();
        let _ = v1.to_v2();
        assert_eq!(v1, before);
    }

    #[test]
    fn test_null_image_is_removed() {
        let v1 = migrate_value(json!([{"insert": {"image": null}}]), SchemaVersion::V1).unwrap();
        assert_eq!(
            serde_json::to_value(&v1).unwrap(),
            json!([{"insert": {}}])
        );
    }

    #[test]
    fn test_null_delta_is_empty() {
        let v1 = migrate_value(Value::Null, SchemaVersion::V1).unwrap();
        assert!(v1.is_empty());
    }

    #[test]
    fn test_malformed_is_an_error() {
        let err = migrate_value(json!([{"attributes": {}}]), SchemaVersion::V2).unwrap_err();
        assert!(matches!(err, DeltaError::MalformedOp { index: 0, .. }));
    }
}
