//! Orchestration: wires the hydrostatic table, tank registry, stage
//! planner, and LP solver together into one run over the nine fixed
//! stages, owns the three tabular output records, and resolves exit
//! codes.

mod gate_config;
mod output;
mod run;
mod stage_table;

pub use ballast_stage::StageResult;
pub use gate_config::{resolve_gate_config, CliOverrides};
pub use output::{ballast_plan_rows, qa_table_rows, stage_summary_rows, BallastPlanRow, QaRow, StageSummaryRow};
pub use run::{execute_run, RunInputs, RunReport};
pub use stage_table::{order_stage_table, StageRow};
