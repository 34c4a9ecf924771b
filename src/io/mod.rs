//! Readers and writers for ABA frameworks and the answers to the problems solved on them.

mod iccma23_aba_reader;
pub use iccma23_aba_reader::Iccma23ABAReader;

mod iccma23_aba_writer;
pub use iccma23_aba_writer::Iccma23ABAWriter;

mod specs;
pub use specs::InstanceReader;
pub use specs::ResponseWriter;
pub use specs::WarningHandler;
