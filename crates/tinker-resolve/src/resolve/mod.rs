//! Validation pass
//!
//! Checks parsed source units against a [`HardwareSpec`](tinker_ast::HardwareSpec).
//!
//! # What This Pass Does
//!
//! 1. **Builds label table** - First declaration of every label, across all units
//! 2. **Bounds checking** - `RX<n>`, `RS<n>` and `S<n>` exist on the hardware
//! 3. **Writability** - `RLI` and `RS<n>` are never written
//! 4. **Opcode set** - Every opcode is permitted on the hardware
//! 5. **Label checks** - No duplicate declarations, no undefined jump targets
//!
//! # What This Pass Does NOT Do
//!
//! - **No operand kind checks** - The parser already enforced signatures
//! - **No lowering** - Jump targets stay names until the VM compiler runs
//!
//! # Pipeline Position
//!
//! ```text
//! Lex → Parse → Validation → Lowering → Execution
//!                  ^^^^^^
//!               YOU ARE HERE
//! ```

mod labels;
mod pipeline;
mod validation;

pub use labels::{LabelEntry, LabelTable};
pub use pipeline::{hardware_error, validate, ValidatedProgram};
pub use validation::ValidationContext;
