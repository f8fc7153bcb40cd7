use hematite_nn::data::synthetic::two_blobs;
use hematite_nn::{evaluate, train_epoch, ActivationFunction, Perceptron, Sgd};

fn main() {
    let (inputs, targets) = two_blobs(200);

    let mut model = Perceptron::new(2, ActivationFunction::Sigmoid).expect("two inputs");
    let optimizer = Sgd::new(0.5);
    let epochs = 500;

    for epoch in 0..epochs {
        let loss = train_epoch(&mut model, &inputs, &targets, &optimizer).expect("training step");
        if epoch % 50 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    let accuracy = evaluate(&model, &inputs, &targets).expect("evaluation");
    println!("Accuracy: {:.1}%", accuracy * 100.0);
    println!(
        "Weights: {:?}, bias: {:.4}",
        model.weights().row_slice(0).expect("weight row"),
        model.bias()
    );
}
