//! Exports the boosting algorithms, the weak learner,
//! and the model-selection tools.

pub use crate::booster::{
    // Booster trait
    Booster,

    // The four regression boosting families
    AdaBoostR2,
    R2Loss,

    GradientBoost,

    HistGradientBoost,

    XgBoost,
};


pub use crate::weak_learner::{
    // Base Learner trait
    WeakLearner,

    GradientHessian,

    // Regression tree
    RegressionTree,
    RegressionTreeBuilder,
    RegressionTreeRegressor,
    SplitStrategy,
};


pub use crate::model::{
    ModelKind,
    PhotozEnsemble,
};


pub use crate::model_selection::{
    cross_val_predict,
    CrossValidation,
    GridSearch,
    ParamGrid,
    ParamSet,
    RandomSearch,
    Scoring,
    SearchOutcome,
};


pub use crate::{
    Feature,
    Sample,
    SampleReader,
};


pub use crate::hypothesis::{
    Regressor,
    WeightedMedian,
    WeightedSum,
};


pub use crate::common::{
    GBMLoss,
    LossFunction,
};
