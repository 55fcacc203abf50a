//! Splitting an order
//!
//! Units move between the source order and a new destination order on the
//! same table. Moving back is symmetric.

use shared::models::Order;

use super::{add_units, recompute_totals};
use crate::error::{PosError, PosResult};

/// How many units of a line to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAmount {
    One,
    All,
}

/// What to do with the source once the split is saved
#[derive(Debug, Clone, PartialEq)]
pub enum SourceAction {
    Update(Order),
    /// Every unit moved out; the source order is deleted
    Delete(i64),
}

/// Persistence plan for a finished split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    /// New order to create (id 0 until the backend assigns one)
    pub destination: Order,
    pub source: SourceAction,
}

#[derive(Debug, Clone)]
pub struct SplitSession {
    source: Order,
    destination: Order,
}

impl SplitSession {
    pub fn new(source: Order) -> PosResult<Self> {
        if source.paid {
            return Err(PosError::OrderAlreadyPaid(source.id));
        }
        if source.status.is_terminal() {
            return Err(PosError::OrderFinished(source.id));
        }
        if source.is_empty() {
            return Err(PosError::OrderEmpty(source.id));
        }
        let mut destination = Order::new(source.table_id);
        destination.status = source.status;
        Ok(Self {
            source,
            destination,
        })
    }

    pub fn source(&self) -> &Order {
        &self.source
    }

    pub fn destination(&self) -> &Order {
        &self.destination
    }

    /// Move units of source line `index` to the destination
    pub fn move_to_destination(&mut self, index: usize, amount: MoveAmount) -> PosResult<()> {
        transfer(&mut self.source, &mut self.destination, index, amount)
    }

    /// Move units of destination line `index` back to the source
    pub fn move_to_source(&mut self, index: usize, amount: MoveAmount) -> PosResult<()> {
        transfer(&mut self.destination, &mut self.source, index, amount)
    }

    pub fn finish(self) -> PosResult<SplitPlan> {
        if self.destination.is_empty() {
            return Err(PosError::SplitInvalid("nothing was moved".to_string()));
        }
        let source = if self.source.is_empty() {
            SourceAction::Delete(self.source.id)
        } else {
            SourceAction::Update(self.source)
        };
        Ok(SplitPlan {
            destination: self.destination,
            source,
        })
    }
}

fn transfer(from: &mut Order, to: &mut Order, index: usize, amount: MoveAmount) -> PosResult<()> {
    let line = from.items.get_mut(index).ok_or(PosError::ItemNotFound(index))?;
    let moved = match amount {
        MoveAmount::One => line.quantity.min(1),
        MoveAmount::All => line.quantity,
    };
    line.quantity -= moved;
    let line = line.clone();
    if line.quantity == 0 {
        from.items.remove(index);
    }

    add_units(&mut to.items, &line, moved);
    recompute_totals(from);
    recompute_totals(to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::fixtures::{line, order};
    use shared::models::UNSAVED_ITEM_ID;

    fn session() -> SplitSession {
        SplitSession::new(order(
            7,
            vec![line(1, 100, 3, None), line(2, 200, 1, Some("no ice"))],
        ))
        .unwrap()
    }

    #[test]
    fn test_move_one_then_all() {
        let mut split = session();
        split.move_to_destination(0, MoveAmount::One).unwrap();
        assert_eq!(split.source().items[0].quantity, 2);
        assert_eq!(split.destination().items[0].quantity, 1);
        assert_eq!(split.destination().items[0].id, UNSAVED_ITEM_ID);

        split.move_to_destination(0, MoveAmount::One).unwrap();
        assert_eq!(split.destination().items.len(), 1);
        assert_eq!(split.destination().items[0].quantity, 2);

        split.move_to_destination(1, MoveAmount::All).unwrap();
        assert_eq!(split.source().items.len(), 1);
        assert_eq!(split.destination().items[1].note.as_deref(), Some("no ice"));
        assert_eq!(split.destination().table_id, Some(5));
        assert_eq!(split.source().total_without_tax, 10.0);
        assert_eq!(split.destination().total_without_tax, 30.0);
    }

    #[test]
    fn test_move_back_is_symmetric() {
        let mut split = session();
        split.move_to_destination(0, MoveAmount::All).unwrap();
        assert_eq!(split.source().items.len(), 1);

        split.move_to_source(0, MoveAmount::One).unwrap();
        assert_eq!(split.destination().items[0].quantity, 2);
        split.move_to_source(0, MoveAmount::All).unwrap();
        assert!(split.destination().is_empty());
        assert_eq!(split.source().unit_count(), 4);
        assert!(matches!(split.finish(), Err(PosError::SplitInvalid(_))));
    }

    #[test]
    fn test_plan_update_or_delete_source() {
        let mut split = session();
        split.move_to_destination(1, MoveAmount::All).unwrap();
        let plan = split.finish().unwrap();
        assert!(matches!(plan.source, SourceAction::Update(ref o) if o.unit_count() == 3));
        assert_eq!(plan.destination.id, 0);

        let mut split = session();
        split.move_to_destination(1, MoveAmount::All).unwrap();
        split.move_to_destination(0, MoveAmount::All).unwrap();
        let plan = split.finish().unwrap();
        assert_eq!(plan.source, SourceAction::Delete(7));
        assert_eq!(plan.destination.unit_count(), 4);
    }

    #[test]
    fn test_bad_index() {
        let mut split = session();
        assert!(matches!(
            split.move_to_destination(5, MoveAmount::One),
            Err(PosError::ItemNotFound(5))
        ));
        assert!(split.move_to_source(0, MoveAmount::One).is_err());
    }
}
