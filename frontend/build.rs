//! Exposes `.env` values to `option_env!` in `src/config.rs`.

const VARIABLES: [&str; 2] = ["BOOK_LIBRARY_ADDRESS", "INFURA_ID"];

fn main() {
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=../.env");

    // The variables may also come straight from the shell.
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=No .env file loaded: {}", e);
    }

    for name in VARIABLES {
        println!("cargo:rerun-if-env-changed={}", name);
        if let Ok(value) = std::env::var(name) {
            println!("cargo:rustc-env={}={}", name, value);
        }
    }
}
