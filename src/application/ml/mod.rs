pub mod evaluation;
pub mod forest;
pub mod predictor;
pub mod service;
pub mod state;
pub mod trainer;

pub use forest::RegressionModel;
pub use predictor::PricePredictor;
pub use service::PredictionService;
pub use state::{TrainedPipelineState, TrainingMetadata};
pub use trainer::{Evaluation, PipelineTrainer, TrainingReport};
