use crate::Entity;

/// Receiver of a registry traversal.
///
/// A front end calls [`begin`](EntitySink::begin) once, then
/// [`entity`](EntitySink::entity) for every entity in its own traversal
/// order, then [`end`](EntitySink::end) once.
pub trait EntitySink {
    fn begin(&mut self);

    fn entity(&mut self, entity: Entity);

    fn end(&mut self);
}

impl EntitySink for Vec<Entity> {
    fn begin(&mut self) {}

    fn entity(&mut self, entity: Entity) {
        self.push(entity);
    }

    fn end(&mut self) {}
}
