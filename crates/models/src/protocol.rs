use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol under which URLs embedded in generated documents are built.
///
/// Defaulted from the request context (`ssl?`), but callers may pin it
/// explicitly, e.g. when building documents outside a request.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn from_ssl(ssl: bool) -> Protocol {
        if ssl {
            Protocol::Https
        } else {
            Protocol::Http
        }
    }

    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl Default for Protocol {
    fn default() -> Protocol {
        Protocol::Http
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.scheme())
    }
}
