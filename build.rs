fn main() {
    // Link args for the ESP-IDF toolchain. Host builds (tests) skip this.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
