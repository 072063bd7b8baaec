// UseCase handlers (u508)
pub mod usecases;
