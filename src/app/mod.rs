// Application layer: pipelines wired from core logic and adapters.

pub mod pipelines;
