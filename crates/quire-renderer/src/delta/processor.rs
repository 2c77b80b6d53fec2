use quire_delta::{Delta, Insert};

use super::DeltaOutput;

/// Walk `delta` in reading order, handing each op to `output`.
pub fn process_delta<O: DeltaOutput>(delta: &Delta, output: &mut O) -> Result<(), O::Error> {
    for op in delta {
        if !output.accepts(op) {
            continue;
        }
        match &op.insert {
            Insert::Text(text) => output.write_text(text, op.attributes.as_ref())?,
            embed => output.write_embed(embed)?,
        }
    }
    Ok(())
}
