/// The first of the two greeting providers.
pub fn hello(name: &str) -> String {
    format!("Hello, {}", name)
}

/// The second provider. Same contract as [`hello`], different phrase.
pub fn howdy(name: &str) -> String {
    format!("Howdy, {}", name)
}
