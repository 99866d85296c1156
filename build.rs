fn main() {
    // Forwards ESP-IDF sysenv (linker args, include paths) exported by
    // esp-idf-sys.  Host-target test builds run --no-default-features,
    // where embuild is absent.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
