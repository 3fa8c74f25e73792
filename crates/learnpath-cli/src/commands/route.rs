use anyhow::{anyhow, Result};

use learnpath_core::{GuardDecision, Route};

use super::Context;

/// Report what the route guard decides for `path` with the current session.
pub fn check(ctx: &Context, path: &str) -> Result<()> {
    let route = Route::parse(path).ok_or_else(|| anyhow!("unknown view: {}", path))?;

    match route.check(&ctx.session.state()) {
        GuardDecision::Allow => println!("{}: allowed", route),
        GuardDecision::Redirect(target) => println!("{}: redirect to {}", route, target),
        GuardDecision::Pending => println!("{}: pending", route),
    }
    Ok(())
}
