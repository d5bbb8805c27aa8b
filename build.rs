fn main() {
    // ESP-IDF link arguments are only needed for firmware builds; host
    // builds (tests, simulation) have nothing to generate.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
