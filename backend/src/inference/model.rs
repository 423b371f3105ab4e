use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::InferenceError;
use crate::inference::preprocess::{PreprocessOptions, preprocess};

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Seam between preprocessing and the serialized model so the HTTP layer can
/// be exercised without a model artifact on disk.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &Array4<f32>) -> Result<f32, InferenceError>;
}

/// ONNX-backed classifier. The plan is optimized once at load time and is
/// immutable afterwards; `run` takes `&self`, so no lock is needed.
pub struct TractClassifier {
    plan: OnnxPlan,
}

impl TractClassifier {
    pub fn load(path: &str, options: &PreprocessOptions) -> Result<Self, InferenceError> {
        let input_shape = tvec!(
            1,
            options.height as usize,
            options.width as usize,
            3usize
        );
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(InferenceError::Model)?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .map_err(InferenceError::Model)?
            .into_optimized()
            .map_err(InferenceError::Model)?
            .into_runnable()
            .map_err(InferenceError::Model)?;
        Ok(Self { plan })
    }
}

impl Classifier for TractClassifier {
    fn predict(&self, input: &Array4<f32>) -> Result<f32, InferenceError> {
        let data = input
            .as_slice()
            .ok_or_else(|| InferenceError::Preprocessing("tensor is not contiguous".to_string()))?;
        let tensor =
            Tensor::from_shape(input.shape(), data).map_err(InferenceError::Model)?;
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(InferenceError::Model)?;
        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(InferenceError::Model)?;
        view.iter().next().copied().ok_or(InferenceError::EmptyOutput)
    }
}

pub struct Model {
    classifier: Box<dyn Classifier>,
    options: PreprocessOptions,
}

impl Model {
    pub fn load(path: &str, options: PreprocessOptions) -> Result<Self, InferenceError> {
        let classifier = TractClassifier::load(path, &options)?;
        log::info!(
            "Loaded ONNX model from {} (input {}x{}x3)",
            path,
            options.height,
            options.width
        );
        Ok(Self {
            classifier: Box::new(classifier),
            options,
        })
    }

    #[cfg(test)]
    pub fn with_classifier(classifier: Box<dyn Classifier>, options: PreprocessOptions) -> Self {
        Self { classifier, options }
    }

    /// One tensor per upload, one scalar per tensor.
    pub fn inference(&self, image: &[u8]) -> Result<f32, InferenceError> {
        let tensor = preprocess(image, &self.options)?;
        self.classifier.predict(&tensor)
    }
}

#[cfg(test)]
pub(crate) struct FixedClassifier(pub f32);

#[cfg(test)]
impl Classifier for FixedClassifier {
    fn predict(&self, _input: &Array4<f32>) -> Result<f32, InferenceError> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use shared::Verdict;
    use std::io::Cursor;

    fn gray_png() -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(512, 512, Rgb([128, 128, 128])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn stub_probability_maps_to_stroke_verdict() {
        let model = Model::with_classifier(
            Box::new(FixedClassifier(0.9)),
            PreprocessOptions::default(),
        );
        let probability = model.inference(&gray_png()).unwrap();
        assert!((probability - 0.9).abs() < f32::EPSILON);

        let verdict = Verdict::from_probability(probability);
        assert_eq!(verdict, Verdict::StrokeDetected);
        assert_eq!(verdict.advisory(), "Please consult a medical professional.");
    }

    #[test]
    fn repeated_inference_yields_the_same_label() {
        let model = Model::with_classifier(
            Box::new(FixedClassifier(0.2)),
            PreprocessOptions::default(),
        );
        let bytes = gray_png();
        let first = Verdict::from_probability(model.inference(&bytes).unwrap());
        let second = Verdict::from_probability(model.inference(&bytes).unwrap());
        assert_eq!(first, second);
        assert_eq!(first, Verdict::Normal);
    }

    #[test]
    fn invalid_bytes_fail_before_the_classifier_runs() {
        let model = Model::with_classifier(
            Box::new(FixedClassifier(0.9)),
            PreprocessOptions::default(),
        );
        assert!(model.inference(b"not an image").is_err());
    }
}
