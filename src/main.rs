use anyhow::Result;
use preshape::{cli, compiler, debug};

fn main() -> Result<()> {
    // Process CLI arguments first so a bad invocation fails before
    // logging init.
    let (config, log_level) = match cli::process_cli() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("preshape: error: {e:#}");
            std::process::exit(2);
        }
    };

    debug::init_log_bridge(log_level);
    log::info!(
        "Compiling '{}' at {}pt from {} corpus file(s)",
        config.language,
        config.point_size,
        config.inputs.len()
    );

    match compiler::compile(&config) {
        Ok(summary) => {
            println!(
                "{}: {} glyphs ({} PUA clusters, {} missing), {} bytes",
                config.font_out.display(),
                summary.glyph_count,
                summary.pua_count,
                summary.missing_count,
                summary.font_bytes
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("preshape: error: {e:#}");
            std::process::exit(1);
        }
    }
}
