use hematite_nn::Tape;

fn main() {
    // f(x, y) = (x·y + x).tanh()
    let tape = Tape::new();
    let x = tape.scalar(0.5);
    let y = tape.scalar(-1.5);
    let f = x.mul(y).add(x).tanh();

    f.backprop();
    println!("f({}, {}) = {:.6}", x.real(), y.real(), f.real());
    println!("df/dx = {:.6}", x.grad());
    println!("df/dy = {:.6}", y.grad());

    // Gradients accumulate across passes until cleared.
    f.backprop();
    println!("after a second pass, df/dx = {:.6}", x.grad());
    tape.zero_grads();
    println!("after zero_grads, df/dx = {:.6}", x.grad());
}
