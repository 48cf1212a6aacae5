use anyhow::Result;
use rebrand_core::{
    error, format_verification_failure, verify_operation, Config, Console, Exclusions,
    OutputFormat, OutputFormatter,
};
use std::path::Path;

pub fn handle_verify(root: &Path, config: &Config, json: bool, use_color: bool) -> Result<i32> {
    let console = if json {
        Console::silent()
    } else {
        Console::new(use_color, false)
    };

    match verify_operation(root, Exclusions::from_config(config), console) {
        Ok(results) => {
            if json {
                println!("{}", results.format(OutputFormat::Json));
            } else {
                println!("{}\n", console.rule());
                print!("{}", results.format(OutputFormat::Summary));
            }
            Ok(results.exit_code())
        },
        Err(err) if json && !error::is_interrupt(&err) => {
            println!("{}", format_verification_failure(&format!("{err:#}")));
            Ok(1)
        },
        Err(err) => Err(err),
    }
}
