//! Small standalone functions exposed next to the prime stream.

use crate::domain::model::Profile;
use crate::utils::error::Result;
use std::io::Write;

pub const DEFAULT_PROFILE_NAME: &str = "Default name set by the native function";

pub fn say_hello<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Hello!!! from native function")?;
    Ok(())
}

pub fn value_from_native() -> &'static str {
    "Native2Host: Hi caller !!!"
}

pub fn echo<W: Write>(out: &mut W, message: &str) -> Result<()> {
    writeln!(out, "{} (printed by native function)", message)?;
    Ok(())
}

pub fn create_profile(name: Option<&str>) -> Profile {
    Profile {
        name: name.unwrap_or(DEFAULT_PROFILE_NAME).to_string(),
        hello: "World!".to_string(),
        age: 21,
        salary: 135.89,
        email: "user@demo.com".to_string(),
        description: "Native bindings are Awesome !!!".to_string(),
    }
}
