//! Passes the environment handle to plugins that ask for it.

use std::borrow::Cow;

use tracing::trace;

use super::scope::ENV_HANDLE_KEY;
use crate::parser::{Expr, ExprKind, Keyword, Location};
use crate::plugins::{ENV_KEYWORD, Plugin};

/// The keyword argument `env=__env__`, located nowhere in the source.
pub fn env_keyword() -> Keyword {
    Keyword {
        arg: Some(ENV_KEYWORD.to_string()),
        value: Expr::new(
            ExprKind::Name(ENV_HANDLE_KEY.to_string()),
            Location::synthetic(),
        ),
        loc: Location::synthetic(),
    }
}

fn is_injected(keyword: &Keyword) -> bool {
    *keyword == env_keyword()
}

/// Keywords of a call to `plugin`, with the environment handle appended
/// when the plugin wants it.
///
/// Keywords that already carry the injected handle are returned unchanged,
/// so injecting twice is the same as injecting once.
pub fn inject_env<'k>(plugin: &Plugin, keywords: &'k [Keyword]) -> Cow<'k, [Keyword]> {
    if !plugin.wants_env() || keywords.iter().any(is_injected) {
        return Cow::Borrowed(keywords);
    }
    trace!(plugin = ?plugin.name(), "injecting environment handle");
    let mut injected = keywords.to_vec();
    injected.push(env_keyword());
    Cow::Owned(injected)
}
