use nix::unistd::{gethostname, getuid, User};
use once_cell::sync::Lazy;
use std::env;

/// `user@host`, resolved once per process.
static IDENTITY: Lazy<String> = Lazy::new(|| {
    let user = User::from_uid(getuid())
        .ok()
        .flatten()
        .map(|user| user.name)
        .or_else(|| env::var("USER").ok())
        .unwrap_or_else(|| "?".to_string());
    let host = gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "?".to_string());
    format!("{}@{}", user, host)
});

/// Builds the prompt shown before each line: `user@host: cwd > `.
pub fn render() -> String {
    let cwd = env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "?".to_string());
    format!("{}: {} > ", *IDENTITY, cwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shape() {
        let prompt = render();
        assert!(prompt.ends_with(" > "));
        let (identity, _) = prompt.split_once(": ").unwrap();
        assert!(identity.contains('@'));
    }
}
