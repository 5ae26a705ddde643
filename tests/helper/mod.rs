pub mod registry;
pub mod runner;

#[allow(unused_imports)]
pub use registry::{mock_project, mock_versions};
#[allow(unused_imports)]
pub use runner::FakeRunner;
