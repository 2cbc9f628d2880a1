//! Tests for the (connector, direction) slot bitset

#[cfg(test)]
mod tests {
    use fencebench::algorithm::slots::SlotSet;
    use fencebench::spatial::Direction;

    // Tests slots of different connectors do not alias
    // Verified by packing three bits per connector
    #[test]
    fn test_slots_are_independent() {
        let mut slots = SlotSet::new(3);
        slots.insert(1, Direction::Right);

        assert!(slots.contains(1, Direction::Right));
        assert!(!slots.contains(2, Direction::Up));
        assert!(!slots.contains(1, Direction::Left));
        assert!(!slots.contains(0, Direction::Right));
        assert_eq!(slots.count(), 1);
    }

    // Tests both ends of a fence are marked together
    // Verified by marking only the first end
    #[test]
    fn test_insert_pair_marks_both_ends() {
        let mut slots = SlotSet::new(2);
        slots.insert_pair((0, Direction::Down), (1, Direction::Up));

        assert!(slots.contains(0, Direction::Down));
        assert!(slots.contains(1, Direction::Up));
        assert_eq!(
            slots.to_vec(),
            vec![(0, Direction::Down), (1, Direction::Up)]
        );
    }

    // Tests slots of unknown connectors are never recorded
    // Verified by growing the set on insert
    #[test]
    fn test_unknown_connectors_ignored() {
        let mut slots = SlotSet::new(1);
        slots.insert(5, Direction::Left);

        assert!(!slots.contains(5, Direction::Left));
        assert_eq!(slots.count(), 0);
        assert_eq!(slots.connectors(), 1);
    }

    // Tests the debug text lists occupied slots
    // Verified by printing only the count
    #[test]
    fn test_display() {
        let mut slots = SlotSet::new(1);
        slots.insert(0, Direction::Up);
        assert_eq!(slots.to_string(), "SlotSet(1 slots: [(0, Up)])");
    }
}
