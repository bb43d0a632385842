use anyhow::{Context, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/syntaxes");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set"));

    // generate syntaxes.bin from syntect's defaults plus our bundled grammars;
    // the defaults ship no Fortran grammar, so we carry our own
    let mut builder = syntect::parsing::SyntaxSet::load_defaults_newlines().into_builder();
    builder
        .add_from_folder(
            concat!(env!("CARGO_MANIFEST_DIR"), "/assets/syntaxes"),
            true,
        )
        .with_context(|| "Failed to load bundled syntax grammars")?;
    let ss = builder.build();

    let syntax_path = out_dir.join("syntaxes.bin");
    let syntax_bytes = bincode::serde::encode_to_vec(&ss, bincode::config::standard())
        .with_context(|| "Failed to serialize syntaxset to bincode")?;
    std::fs::write(&syntax_path, syntax_bytes)
        .with_context(|| "Failed to write serialized syntaxes")?;

    Ok(())
}
