//! # ad-directory
//!
//! Directory object model for Active Directory.
//!
//! This crate provides:
//! - [`ObjectGuid`]: the 16-byte object identifier and its hex form
//! - [`DirectoryObject`]: typed attribute access and staged writes
//! - Typed views: [`User`], [`Group`], [`Computer`], [`Printer`]
//! - [`MembershipResolver`]: direct members and transitive ancestors
//! - [`Directory`]: the query primitive, implemented over `ldap3` by
//!   [`LdapDirectory`] and in memory by [`InMemoryDirectory`]

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod client;
pub mod config;
pub mod connection;
pub mod entry;
pub mod error;
pub mod filter;
pub mod guid;
pub mod membership;
pub mod memory;
pub mod views;

pub use client::{Directory, SearchRequest, SearchScope};
pub use config::{DirectoryConfig, DirectoryConfigBuilder};
pub use connection::LdapDirectory;
pub use entry::{DirectoryObject, EntityClass, Modification};
pub use error::{DirectoryError, DirectoryResult};
pub use guid::ObjectGuid;
pub use membership::{MemberKind, Membership, MembershipResolver, ParentStrategy};
pub use memory::InMemoryDirectory;
pub use views::{AccountControl, Computer, DirectoryView, Group, GroupType, MemberOf, Printer, User};
