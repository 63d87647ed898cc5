pub mod estimate_cmd;
pub mod output;
pub mod renderer;
