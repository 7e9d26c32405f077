use std::io::Write;
use structopt::clap::Shell;
use structopt::StructOpt;

use crate::configuration::APP_NAME;
use crate::CliArgs;

/// Prints a shell completion script for the `orgdir` command line
#[derive(StructOpt, Debug)]
pub struct CompleteCommand {
    /// Target shell
    #[structopt(possible_values = &Shell::variants(), case_insensitive = true)]
    shell: Shell,
}

impl CompleteCommand {
    pub fn run_command(&self) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        self.write_script(&mut stdout.lock())
    }

    fn write_script<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        writeln!(out, "# {} completions for {}", APP_NAME, self.shell)?;
        CliArgs::clap().gen_completions_to(APP_NAME, self.shell, out);
        Ok(())
    }
}
