// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cim-adapters: contracts for the systems cim drives, with real and fake
//! implementations

pub mod mail;
pub mod registry;
pub mod status;
pub mod subprocess;
pub mod worker;

pub use mail::{EmailMessage, MailAdapter, MailError, SendmailAdapter};
pub use registry::{
    BuildRequest, DockerRegistryAdapter, RegistryAdapter, RegistryCredentials, RegistryError,
};
pub use status::{GithubStatusAdapter, StatusAdapter, StatusError, StatusUpdate};
pub use worker::{
    CommandOutput, LocalWorkerAdapter, Workspace, WorkerAdapter, WorkerError, WorkspaceRequest,
};

#[cfg(any(test, feature = "test-support"))]
pub use mail::FakeMailAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use registry::{FakeRegistryAdapter, RegistryCall};
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStatusAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use worker::{ExecCall, FakeWorkerAdapter};
