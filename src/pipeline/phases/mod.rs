// Phases of a sync pass, in execution order. Each phase reads what earlier
// phases left in the shared context and adds its own results.

#[path = "01_build_order.rs"]
pub mod build_order;
#[path = "02_classify.rs"]
pub mod classify;
#[path = "03_scope.rs"]
pub mod scope;
#[path = "04_descriptors.rs"]
pub mod descriptors;
