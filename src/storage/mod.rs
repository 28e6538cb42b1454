//! Remote file storage.
//!
//! [`FileStore`] saves uploads on HDFS under names that do not collide with
//! existing files, rewriting a taken `report.pdf` as `report_XXXXXXX.pdf`.
//! The filesystem itself sits behind the [`RemoteFs`] trait.

pub mod auth;
pub mod naming;
pub mod remote;
pub mod store;
pub mod suffix;

pub use auth::{AccessCredential, DelegationTokenClient, HdfsAuth, TokenProvider, TokenSource};
pub use naming::{secure_filename, RemoteName};
pub use remote::{connect, ContentSummary, OperatorFs, RefreshingFs, RemoteFs};
pub use store::FileStore;
pub use suffix::{RandomSuffix, SuffixGenerator, SUFFIX_CHARS, SUFFIX_LENGTH};
