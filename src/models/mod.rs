// SPDX-License-Identifier: MIT

//! Data models mirroring the Esclavizador API schemas.

pub mod project;
pub mod report;
pub mod tag;
pub mod task;
pub mod time_entry;
pub mod user;

pub use project::{Project, ProjectDraft, ProjectPage, ProjectPatch};
pub use report::{ProjectAggregate, ProjectAggregateList, ReportFilter};
pub use tag::{Tag, TagDraft, TagPage};
pub use task::{Task, TaskDraft, TaskPage, TaskPatch};
pub use time_entry::{
    EntryFilter, ManualEntry, StartTimer, TimeEntry, TimeEntryPage, TimeEntryPatch,
};
pub use user::{RegisterRequest, SessionTokens, TokenResponse, User, UserPage, UserPatch, UserRole};
