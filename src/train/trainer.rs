use crate::autodiff::Tape;
use crate::error::Result;
use crate::loss::MseLoss;
use crate::optim::Sgd;
use crate::perceptron::Perceptron;

/// One pass over the dataset with per-sample gradient descent.
///
/// Each sample gets a fresh tape: stage the parameters, run the
/// differentiable forward pass, backprop the squared error, and step.
/// Returns the mean squared error over the epoch.
pub fn train_epoch(
    model: &mut Perceptron,
    inputs: &[Vec<f64>],
    targets: &[f64],
    optimizer: &Sgd,
) -> Result<f64> {
    let mut total = 0.0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        let tape = Tape::new();
        let staged = model.stage(&tape)?;
        let predicted = staged.forward(input)?;
        let diff = predicted.sub(*target);
        let loss = diff.mul(diff);
        loss.backprop();
        optimizer.step(model, &staged)?;
        total += loss.real();
    }
    Ok(total / inputs.len() as f64)
}

/// Trains for `epochs` passes, logging progress every 100 epochs.
pub fn train(
    model: &mut Perceptron,
    inputs: &[Vec<f64>],
    targets: &[f64],
    optimizer: &Sgd,
    epochs: usize,
) -> Result<f64> {
    let mut epoch_loss = 0.0;
    for epoch in 0..epochs {
        epoch_loss = train_epoch(model, inputs, targets, optimizer)?;
        if epoch % 100 == 0 {
            println!("epoch {epoch}: loss = {epoch_loss:.6}");
        }
    }
    Ok(epoch_loss)
}

/// Mean squared error of the model over a dataset, without training.
pub fn mean_loss(model: &Perceptron, inputs: &[Vec<f64>], targets: &[f64]) -> Result<f64> {
    let mut predicted = Vec::with_capacity(inputs.len());
    for input in inputs {
        predicted.push(model.forward(input)?);
    }
    Ok(MseLoss::loss(&predicted, targets))
}

/// Fraction of samples classified correctly, thresholding output and
/// target at 0.5.
pub fn evaluate(model: &Perceptron, inputs: &[Vec<f64>], targets: &[f64]) -> Result<f64> {
    let mut correct = 0;
    for (input, target) in inputs.iter().zip(targets.iter()) {
        let predicted = model.forward(input)?;
        if (predicted >= 0.5) == (*target >= 0.5) {
            correct += 1;
        }
    }
    Ok(correct as f64 / inputs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;

    #[test]
    fn fits_a_line() {
        // y = 2x - 1, no noise; identity activation can fit it exactly.
        let inputs: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64 / 20.0]).collect();
        let targets: Vec<f64> = inputs.iter().map(|x| 2.0 * x[0] - 1.0).collect();

        let mut model = Perceptron::new(1, ActivationFunction::Identity).unwrap();
        let optimizer = Sgd::new(0.1);
        let initial = mean_loss(&model, &inputs, &targets).unwrap();
        let last = train(&mut model, &inputs, &targets, &optimizer, 500).unwrap();

        assert!(last < initial);
        assert!(last < 1e-3, "final loss {last}");
        assert!((model.weights().get(0, 0).unwrap() - 2.0).abs() < 0.1);
        assert!((model.bias() + 1.0).abs() < 0.1);
    }

    #[test]
    fn learns_the_and_gate() {
        let inputs = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let targets = vec![0.0, 0.0, 0.0, 1.0];

        let mut model = Perceptron::new(2, ActivationFunction::Sigmoid).unwrap();
        let optimizer = Sgd::new(0.5);
        train(&mut model, &inputs, &targets, &optimizer, 2000).unwrap();

        let accuracy = evaluate(&model, &inputs, &targets).unwrap();
        assert_eq!(accuracy, 1.0);
    }
}
