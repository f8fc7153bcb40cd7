use std::cell::RefCell;
use std::ops;

/// One recorded operation. Variants carry the arena indices of their
/// parent nodes; the backward pass dispatches on the tag.
#[derive(Debug, Clone, Copy)]
enum Op {
    Leaf,
    Add(usize, usize),
    Sub(usize, usize),
    Mul(usize, usize),
    Div(usize, usize),
    Relu(usize),
    Sigmoid(usize),
    Tanh(usize),
}

#[derive(Debug, Clone, Copy)]
struct Node {
    /// Forward value.
    real: f64,
    /// Forward-mode tangent. Propagated through every operation for
    /// compatibility with seeded forward differentiation, but not consulted
    /// by the reverse pass.
    dual: f64,
    /// Gradient accumulator; meaningful only after a backward pass and
    /// until the caller resets it.
    grad: f64,
    op: Op,
}

/// Arena of computation-graph nodes.
///
/// Nodes are append-only, so an operation's parents always have smaller
/// indices than its result. Gradients persist across passes until
/// [`Tape::zero_grads`] (or a per-node reset) is called.
#[derive(Debug, Default)]
pub struct Tape {
    nodes: RefCell<Vec<Node>>,
}

impl Tape {
    pub fn new() -> Tape {
        Tape {
            nodes: RefCell::new(Vec::new()),
        }
    }

    /// Creates a leaf node with tangent 0.
    pub fn scalar(&self, real: f64) -> Scalar<'_> {
        self.scalar_with_dual(real, 0.0)
    }

    /// Creates a leaf node with an explicit forward-mode tangent seed.
    pub fn scalar_with_dual(&self, real: f64, dual: f64) -> Scalar<'_> {
        self.push(real, dual, Op::Leaf)
    }

    /// Number of nodes recorded so far.
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Resets every gradient accumulator to 0. Called by the training step
    /// between backward passes; the engine never resets grads on its own.
    pub fn zero_grads(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.grad = 0.0;
        }
    }

    fn push(&self, real: f64, dual: f64, op: Op) -> Scalar<'_> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            real,
            dual,
            grad: 0.0,
            op,
        });
        Scalar {
            tape: self,
            id: nodes.len() - 1,
        }
    }
}

/// Conversion of operands into graph nodes.
///
/// Raw `f64` values are coerced into fresh leaf nodes on the same tape, so
/// every arithmetic entry point has one unambiguous contract.
pub trait IntoScalar<'t> {
    fn into_scalar(self, tape: &'t Tape) -> Scalar<'t>;
}

impl<'t> IntoScalar<'t> for Scalar<'t> {
    fn into_scalar(self, _tape: &'t Tape) -> Scalar<'t> {
        self
    }
}

impl<'t> IntoScalar<'t> for f64 {
    fn into_scalar(self, tape: &'t Tape) -> Scalar<'t> {
        tape.scalar(self)
    }
}

/// Handle to one node of a [`Tape`].
#[derive(Debug, Clone, Copy)]
pub struct Scalar<'t> {
    tape: &'t Tape,
    id: usize,
}

impl<'t> Scalar<'t> {
    pub fn real(&self) -> f64 {
        self.tape.nodes.borrow()[self.id].real
    }

    pub fn dual(&self) -> f64 {
        self.tape.nodes.borrow()[self.id].dual
    }

    pub fn grad(&self) -> f64 {
        self.tape.nodes.borrow()[self.id].grad
    }

    /// Overwrites this node's gradient accumulator (external reset path).
    pub fn set_grad(&self, grad: f64) {
        self.tape.nodes.borrow_mut()[self.id].grad = grad;
    }

    pub fn zero_grad(&self) {
        self.set_grad(0.0);
    }

    pub fn add(self, rhs: impl IntoScalar<'t>) -> Scalar<'t> {
        let rhs = rhs.into_scalar(self.tape);
        let (a, b) = (self.values(), rhs.values());
        self.tape
            .push(a.0 + b.0, a.1 + b.1, Op::Add(self.id, rhs.id))
    }

    pub fn sub(self, rhs: impl IntoScalar<'t>) -> Scalar<'t> {
        let rhs = rhs.into_scalar(self.tape);
        let (a, b) = (self.values(), rhs.values());
        self.tape
            .push(a.0 - b.0, a.1 - b.1, Op::Sub(self.id, rhs.id))
    }

    /// Product; the tangent follows the product rule.
    pub fn mul(self, rhs: impl IntoScalar<'t>) -> Scalar<'t> {
        let rhs = rhs.into_scalar(self.tape);
        let (a, b) = (self.values(), rhs.values());
        self.tape
            .push(a.0 * b.0, a.1 * b.0 + a.0 * b.1, Op::Mul(self.id, rhs.id))
    }

    /// Quotient; the tangent follows the quotient rule. A zero divisor is
    /// not guarded: it produces non-finite floats that propagate silently.
    pub fn div(self, rhs: impl IntoScalar<'t>) -> Scalar<'t> {
        let rhs = rhs.into_scalar(self.tape);
        let (a, b) = (self.values(), rhs.values());
        self.tape.push(
            a.0 / b.0,
            (a.1 * b.0 - a.0 * b.1) / (b.0 * b.0),
            Op::Div(self.id, rhs.id),
        )
    }

    /// max(0, x).
    pub fn relu(self) -> Scalar<'t> {
        let (real, dual) = self.values();
        let (r, d) = if real > 0.0 { (real, dual) } else { (0.0, 0.0) };
        self.tape.push(r, d, Op::Relu(self.id))
    }

    /// Logistic sigmoid.
    pub fn sigmoid(self) -> Scalar<'t> {
        let (real, dual) = self.values();
        let s = 1.0 / (1.0 + (-real).exp());
        self.tape.push(s, s * (1.0 - s) * dual, Op::Sigmoid(self.id))
    }

    pub fn tanh(self) -> Scalar<'t> {
        let (real, dual) = self.values();
        let t = real.tanh();
        self.tape.push(t, (1.0 - t * t) * dual, Op::Tanh(self.id))
    }

    /// Runs the backward pass from this node.
    ///
    /// Seeds `grad = 1` here, marks the reachable subgraph with an explicit
    /// stack (no recursion), then applies each reachable node's backward
    /// rule exactly once in reverse creation order. Since parents always
    /// precede children in the arena, that order is topological: a node's
    /// gradient is complete before it propagates to its parents, and
    /// contributions are always added, never assigned, so fan-out sums
    /// correctly.
    pub fn backprop(&self) {
        let mut nodes = self.tape.nodes.borrow_mut();
        nodes[self.id].grad = 1.0;

        let mut visited = vec![false; self.id + 1];
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            if visited[id] {
                continue;
            }
            visited[id] = true;
            match nodes[id].op {
                Op::Leaf => {}
                Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) | Op::Div(a, b) => {
                    stack.push(a);
                    stack.push(b);
                }
                Op::Relu(a) | Op::Sigmoid(a) | Op::Tanh(a) => stack.push(a),
            }
        }

        for id in (0..=self.id).rev() {
            if !visited[id] {
                continue;
            }
            let g = nodes[id].grad;
            match nodes[id].op {
                Op::Leaf => {}
                Op::Add(a, b) => {
                    nodes[a].grad += g;
                    nodes[b].grad += g;
                }
                Op::Sub(a, b) => {
                    nodes[a].grad += g;
                    nodes[b].grad -= g;
                }
                Op::Mul(a, b) => {
                    let (ar, br) = (nodes[a].real, nodes[b].real);
                    nodes[a].grad += br * g;
                    nodes[b].grad += ar * g;
                }
                Op::Div(a, b) => {
                    let (ar, br) = (nodes[a].real, nodes[b].real);
                    nodes[a].grad += g / br;
                    nodes[b].grad += -ar / (br * br) * g;
                }
                Op::Relu(a) => {
                    if nodes[a].real > 0.0 {
                        nodes[a].grad += g;
                    }
                }
                Op::Sigmoid(a) => {
                    let s = nodes[id].real;
                    nodes[a].grad += s * (1.0 - s) * g;
                }
                Op::Tanh(a) => {
                    let t = nodes[id].real;
                    nodes[a].grad += (1.0 - t * t) * g;
                }
            }
        }
    }

    fn values(&self) -> (f64, f64) {
        let node = self.tape.nodes.borrow()[self.id];
        (node.real, node.dual)
    }
}

impl<'t> ops::Add for Scalar<'t> {
    type Output = Scalar<'t>;
    fn add(self, rhs: Scalar<'t>) -> Scalar<'t> {
        Scalar::add(self, rhs)
    }
}

impl<'t> ops::Add<f64> for Scalar<'t> {
    type Output = Scalar<'t>;
    fn add(self, rhs: f64) -> Scalar<'t> {
        Scalar::add(self, rhs)
    }
}

impl<'t> ops::Sub for Scalar<'t> {
    type Output = Scalar<'t>;
    fn sub(self, rhs: Scalar<'t>) -> Scalar<'t> {
        Scalar::sub(self, rhs)
    }
}

impl<'t> ops::Sub<f64> for Scalar<'t> {
    type Output = Scalar<'t>;
    fn sub(self, rhs: f64) -> Scalar<'t> {
        Scalar::sub(self, rhs)
    }
}

impl<'t> ops::Mul for Scalar<'t> {
    type Output = Scalar<'t>;
    fn mul(self, rhs: Scalar<'t>) -> Scalar<'t> {
        Scalar::mul(self, rhs)
    }
}

impl<'t> ops::Mul<f64> for Scalar<'t> {
    type Output = Scalar<'t>;
    fn mul(self, rhs: f64) -> Scalar<'t> {
        Scalar::mul(self, rhs)
    }
}

impl<'t> ops::Div for Scalar<'t> {
    type Output = Scalar<'t>;
    fn div(self, rhs: Scalar<'t>) -> Scalar<'t> {
        Scalar::div(self, rhs)
    }
}

impl<'t> ops::Div<f64> for Scalar<'t> {
    type Output = Scalar<'t>;
    fn div(self, rhs: f64) -> Scalar<'t> {
        Scalar::div(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    #[test]
    fn leaf_starts_clean() {
        let tape = Tape::new();
        let x = tape.scalar(3.0);
        assert_eq!(x.real(), 3.0);
        assert_eq!(x.dual(), 0.0);
        assert_eq!(x.grad(), 0.0);
        assert_eq!(tape.len(), 1);
    }

    #[test]
    fn mul_add_gradients() {
        // z = x*y + x at x=3, y=4: dz/dx = y + 1 = 5, dz/dy = x = 3.
        let tape = Tape::new();
        let x = tape.scalar(3.0);
        let y = tape.scalar(4.0);
        let z = x.mul(y).add(x);
        assert_eq!(z.real(), 15.0);
        z.backprop();
        assert!(approx_eq(x.grad(), 5.0));
        assert!(approx_eq(y.grad(), 3.0));
        assert!(approx_eq(z.grad(), 1.0));
    }

    #[test]
    fn sub_gradients() {
        let tape = Tape::new();
        let x = tape.scalar(7.0);
        let y = tape.scalar(2.0);
        let z = x.sub(y);
        assert_eq!(z.real(), 5.0);
        z.backprop();
        assert!(approx_eq(x.grad(), 1.0));
        assert!(approx_eq(y.grad(), -1.0));
    }

    #[test]
    fn div_quotient_rule() {
        // z = x / y at x=6, y=3: dz/dx = 1/3, dz/dy = -6/9.
        let tape = Tape::new();
        let x = tape.scalar(6.0);
        let y = tape.scalar(3.0);
        let z = x.div(y);
        assert_eq!(z.real(), 2.0);
        z.backprop();
        assert!(approx_eq(x.grad(), 1.0 / 3.0));
        assert!(approx_eq(y.grad(), -6.0 / 9.0));
    }

    #[test]
    fn raw_f64_coerces_to_leaf() {
        let tape = Tape::new();
        let x = tape.scalar(3.0);
        let z = x.mul(2.0).add(1.0);
        assert_eq!(z.real(), 7.0);
        z.backprop();
        assert!(approx_eq(x.grad(), 2.0));
    }

    #[test]
    fn operator_overloads_match_methods() {
        let tape = Tape::new();
        let x = tape.scalar(3.0);
        let y = tape.scalar(4.0);
        let z = x * y + x;
        z.backprop();
        assert!(approx_eq(x.grad(), 5.0));
        assert!(approx_eq(y.grad(), 3.0));
    }

    #[test]
    fn relu_gates_gradient() {
        let tape = Tape::new();
        let x = tape.scalar(-2.0);
        let y = x.relu();
        assert_eq!(y.real(), 0.0);
        y.backprop();
        assert_eq!(x.grad(), 0.0);

        let p = tape.scalar(2.0);
        let q = p.relu();
        assert_eq!(q.real(), 2.0);
        q.backprop();
        assert!(approx_eq(p.grad(), 1.0));
    }

    #[test]
    fn sigmoid_gradient_at_zero() {
        let tape = Tape::new();
        let x = tape.scalar(0.0);
        let y = x.sigmoid();
        assert!(approx_eq(y.real(), 0.5));
        y.backprop();
        assert!(approx_eq(x.grad(), 0.25));
    }

    #[test]
    fn tanh_gradient_at_zero() {
        let tape = Tape::new();
        let x = tape.scalar(0.0);
        let y = x.tanh();
        assert!(approx_eq(y.real(), 0.0));
        y.backprop();
        assert!(approx_eq(x.grad(), 1.0));
    }

    #[test]
    fn fan_out_accumulates_both_paths() {
        // s = x + y feeds both factors of z = s * s:
        // dz/ds = 2s, so dz/dx = dz/dy = 2s.
        let tape = Tape::new();
        let x = tape.scalar(2.0);
        let y = tape.scalar(1.0);
        let s = x.add(y);
        let z = s.mul(s);
        assert_eq!(z.real(), 9.0);
        z.backprop();
        assert!(approx_eq(s.grad(), 6.0));
        assert!(approx_eq(x.grad(), 6.0));
        assert!(approx_eq(y.grad(), 6.0));
    }

    #[test]
    fn fan_out_at_different_depths() {
        // z = s * (s + c): dz/ds = 2s + c.
        let tape = Tape::new();
        let s = tape.scalar(3.0);
        let c = tape.scalar(5.0);
        let t = s.add(c);
        let z = s.mul(t);
        z.backprop();
        assert!(approx_eq(s.grad(), 2.0 * 3.0 + 5.0));
        assert!(approx_eq(c.grad(), 3.0));
    }

    #[test]
    fn forward_dual_follows_chain_rule() {
        // Seed dx = 1: d(x*x + 2x)/dx = 2x + 2 = 8 at x = 3.
        let tape = Tape::new();
        let x = tape.scalar_with_dual(3.0, 1.0);
        let y = x.mul(x).add(x.mul(2.0));
        assert_eq!(y.real(), 15.0);
        assert!(approx_eq(y.dual(), 8.0));
    }

    #[test]
    fn grads_persist_until_reset() {
        let tape = Tape::new();
        let x = tape.scalar(2.0);
        let z = x.mul(x);
        z.backprop();
        assert!(approx_eq(x.grad(), 4.0));

        // Without a reset a second pass accumulates on top.
        z.backprop();
        assert!(approx_eq(x.grad(), 8.0));

        tape.zero_grads();
        assert_eq!(x.grad(), 0.0);
        z.backprop();
        assert!(approx_eq(x.grad(), 4.0));
    }

    #[test]
    fn set_grad_overwrites() {
        let tape = Tape::new();
        let x = tape.scalar(1.0);
        x.set_grad(7.0);
        assert_eq!(x.grad(), 7.0);
        x.zero_grad();
        assert_eq!(x.grad(), 0.0);
    }

    #[test]
    fn division_by_zero_propagates_nonfinite() {
        let tape = Tape::new();
        let x = tape.scalar(1.0);
        let z = x.div(0.0);
        assert!(z.real().is_infinite());
    }
}
