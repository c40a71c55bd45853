/// A unit of work driven periodically by the scheduler loop of the binary.
///
/// Each call runs to completion before the next one starts.
pub trait LoopTask {
    fn tick(&mut self);
}
