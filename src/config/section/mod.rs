//! Configuration section definitions.
//!
//! Each module corresponds to a section in `docsplice.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `build`   | `[build]`    | Output directory, asset copying          |
//! | `project` | `[project]`  | Project root, docs and components dirs   |
//! | `repo`    | `[repo]`     | Repository name, branch, host for links  |
//! | `script`  | `[script]`   | Injected `<script setup>` templates      |

mod build;
mod project;
mod repo;
mod script;

pub use build::BuildConfig;
pub use project::ProjectConfig;
pub use repo::{DEFAULT_BRANCH, RepoConfig};
pub use script::ScriptConfig;
