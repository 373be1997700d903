pub mod access;
pub mod authz;
pub mod domain;
pub mod ports;
pub mod render;
pub mod sections;
pub mod slug;

pub use domain::{
    Media, MediaKind, NewVisit, Role, Section, SectionType, User, UserCredentials,
    UserSummary, Welcomebook, WelcomebookSummary, WelcomebookWithSections,
};
pub use ports::{BlobStore, PortError, PortResult, SectionUpdate, Store, UserUpdate};
