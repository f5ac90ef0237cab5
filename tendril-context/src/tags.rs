//! Well-known tag names.

/// Applied to mounted application components.
pub const COMPONENT: &str = "component";

/// Applied to servers. The tag value orders servers during start and stop.
pub const SERVER: &str = "server";

/// Applied to controllers.
pub const CONTROLLER: &str = "controller";

/// Applied to values which should be started and stopped with the application.
pub const LIFECYCLE_OBSERVER: &str = "lifecycle_observer";

/// Applied to providers declared by application components.
pub const PROVIDER: &str = "provider";

/// Applied to data sources.
pub const DATASOURCE: &str = "datasource";
