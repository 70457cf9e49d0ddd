//! # makerpub_runner
//!
//! External command execution for makerpub.
//!
//! Every channel that talks to an outside tool (`git`, `gh`, `osascript`,
//! the PDF backend) goes through the [`CommandRunner`] trait. Each
//! [`CommandSpec`] carries its own working directory, so nothing in the
//! workspace ever changes the process-wide current directory.
//!
//! # Runners
//!
//! - **SystemRunner**: spawns real processes and blocks until they exit
//! - **MockRunner**: captures calls and replays queued responses in tests
//!
//! # Example
//!
//! ```rust,no_run
//! use makerpub_runner::{CommandRunner, CommandSpec, SystemRunner};
//!
//! let runner = SystemRunner::new();
//! let status = CommandSpec::new("git")
//!     .args(["status", "--porcelain"])
//!     .current_dir("/tmp/my-project");
//!
//! let output = runner.run(&status).unwrap();
//! println!("dirty: {}", !output.stdout.trim().is_empty());
//! ```

pub mod command;
pub mod error;
pub mod mock;
pub mod runner;

pub use command::{CommandOutput, CommandSpec};
pub use error::{RunnerError, RunnerResult};
pub use mock::{CapturedCall, MockResponse, MockRunner};
pub use runner::{CommandRunner, SystemRunner};
