//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach storage through a Unit of Work.

mod member_service;

pub use member_service::{MemberManager, MemberService};
