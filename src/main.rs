// This binary crate is intentionally minimal.
// All matrix and autodiff logic lives in the library (src/lib.rs and its modules).
// Run demos with:
//   cargo run --example blobs
//   cargo run --example gradients
fn main() {
    println!("hematite-nn: a matrix engine and scalar autodiff library in Rust.");
    println!("Run `cargo run --example blobs` to train a perceptron on synthetic data.");
}
