use bevy::prelude::*;
use std::collections::VecDeque;

/// 显式订阅的通知频道：控件生成时订阅，销毁时退订
#[derive(Resource, Debug)]
pub struct EventChannel<T: Send + Sync + 'static> {
    subscribers: Vec<Entity>,
    queue: VecDeque<T>,
}

impl<T: Send + Sync + 'static> Default for EventChannel<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            queue: VecDeque::new(),
        }
    }
}

impl<T: Send + Sync + 'static> EventChannel<T> {
    pub fn subscribe(&mut self, subscriber: Entity) -> bool {
        if self.subscribers.contains(&subscriber) {
            return false;
        }
        self.subscribers.push(subscriber);
        true
    }

    pub fn unsubscribe(&mut self, subscriber: Entity) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| *s != subscriber);
        self.subscribers.len() != before
    }

    pub fn subscribers(&self) -> &[Entity] {
        &self.subscribers
    }

    pub fn raise(&mut self, event: T) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// 按到达顺序把每条通知交给当前所有订阅者
    pub fn broadcast(&mut self, mut deliver: impl FnMut(Entity, &T)) {
        while let Some(event) = self.queue.pop_front() {
            for subscriber in &self.subscribers {
                deliver(*subscriber, &event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribed_entities_stop_receiving() {
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let mut channel = EventChannel::<u32>::default();
        assert!(channel.subscribe(a));
        assert!(channel.subscribe(b));
        assert!(!channel.subscribe(a));

        channel.raise(7);
        let mut got = Vec::new();
        channel.broadcast(|e, v| got.push((e, *v)));
        assert_eq!(got, vec![(a, 7), (b, 7)]);

        assert!(channel.unsubscribe(a));
        assert!(!channel.unsubscribe(a));
        channel.raise(8);
        channel.raise(9);
        got.clear();
        channel.broadcast(|e, v| got.push((e, *v)));
        assert_eq!(got, vec![(b, 8), (b, 9)]);
        assert_eq!(channel.pending(), 0);
    }
}
