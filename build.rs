use shadow_rs::ShadowBuilder;

// Exposes version and git metadata to `astro_rs::build` for `--version`
// and the health endpoint.
fn main() {
    ShadowBuilder::builder()
        .build()
        .expect("shadow-rs build metadata");
}
