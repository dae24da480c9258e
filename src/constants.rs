//! Media types, profile URIs and the link-relation namespace shared by every
//! resource representation.

pub const MASON: &str = "application/vnd.mason+json";

pub const NAMESPACE: &str = "nearby";
pub const LINK_RELATIONS_URL: &str = "/nearby/link-relations/";

pub const AREA_PROFILE: &str = "/profiles/area/";
pub const EVENT_PROFILE: &str = "/profiles/event/";
pub const ERROR_PROFILE: &str = "/profiles/error/";

/// Country assigned to areas created without one.
pub const DEFAULT_COUNTRY: &str = "Finland";
