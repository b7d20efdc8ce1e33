/// Something that reacts to events of type `T`, e.g. a host rendering session events.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}

impl<T, F> EventHandler<T> for F
where
    F: FnMut(&T),
{
    fn handle_event(&mut self, event: &T) {
        self(event)
    }
}
