mod output;
mod script;
mod spawner;
mod traits;

pub use output::GeneratorOutput;
pub use script::{ScriptGenerator, DEFAULT_SCRIPT_NAME};
pub use spawner::ProcessSpawner;
pub use traits::{ChangelogGenerator, GeneratorConfig, GeneratorError, GeneratorRequest};
