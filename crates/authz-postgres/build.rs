#![forbid(unsafe_code)]

/// `embed_migrations!` reads `./migrations` at compile time but cannot ask
/// cargo to watch it, so adding or editing a migration would not trigger a
/// rebuild without this.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
