use structopt::StructOpt;

use crate::tree::DEFAULT_MAX_DEPTH;

#[derive(StructOpt, Clone, Debug)]
pub struct Config {
    /// Deepest level an activity can be created at (roots are level 1)
    #[structopt(
        long,
        env = "ORGDIR_MAX_ACTIVITY_DEPTH",
        default_value = "3",
        parse(try_from_str = parse_max_depth)
    )]
    pub max_activity_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_activity_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, structopt::clap::Error> {
        // no arguments: only ENV values and defaults apply
        Config::from_iter_safe(&[""])
    }

    pub fn max_activity_depth(mut self, depth: u32) -> Self {
        self.max_activity_depth = depth;
        self
    }
}

fn parse_max_depth(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(depth) => Ok(depth),
        Err(e) => Err(e.to_string()),
    }
}
