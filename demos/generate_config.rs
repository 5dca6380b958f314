//! Generate a default calibration configuration file
//!
//! Creates a JSON config with all default parameters and recovery enabled

use lab_calibration::{PipelineConfig, RecoveryConfig};
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} presets/default.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = PipelineConfig {
        recovery: Some(RecoveryConfig::default()),
        ..PipelineConfig::default()
    };

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Transfer: {:?}, strength {:.2}",
                config.mode,
                config.strength.value()
            );
            eprintln!("  Sample step: {}", config.sample_step);
            if let Some(recovery) = &config.recovery {
                eprintln!(
                    "  Recovery: exposure {}, white balance {}",
                    recovery.auto_exposure, recovery.auto_white_balance
                );
                eprintln!(
                    "  Recovery target L*a*b*: ({:.1}, {:.1}, {:.1})",
                    recovery.target.l,
                    recovery.target.a,
                    recovery.target.b
                );
            }
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
