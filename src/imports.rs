pub use ::anyhow::{anyhow, bail, ensure, Context, Result};
pub use ::const_format::concatcp;
pub use ::itertools::Itertools;
pub use ::log::{debug, error, info, warn};
pub use ::once_cell::sync::OnceCell;
pub use ::regex::Regex;
pub use ::serde::Deserialize;
pub use ::std::collections::HashMap;
pub use ::std::fmt;
pub use ::std::path::{Path, PathBuf};
pub use ::time::macros::{datetime, format_description};
pub use ::time::{Date, OffsetDateTime};
pub use ::time_tz::{timezones, OffsetDateTimeExt};
