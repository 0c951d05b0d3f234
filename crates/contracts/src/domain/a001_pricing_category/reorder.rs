//! Перестановка категорий drag-and-drop.
//!
//! Чистые функции без ввода-вывода: по жесту (перетаскиваемая категория,
//! категория под курсором) строят новый порядок и плотную нумерацию 1..N,
//! которую затем записывает цикл сохранения на клиенте.

use serde::{Deserialize, Serialize};

use super::aggregate::{PricingCategory, PricingCategoryId};

/// Новое значение `sort_order` для одной категории
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderAssignment {
    pub id: PricingCategoryId,
    pub sort_order: i32,
}

/// Результат перестановки: новый порядок и полный список назначений
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan {
    pub order: Vec<PricingCategory>,
    pub assignments: Vec<SortOrderAssignment>,
}

impl ReorderPlan {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

fn position_of(order: &[PricingCategory], id: PricingCategoryId) -> Option<usize> {
    order.iter().position(|c| c.id == id)
}

/// Переместить `source_id` на место `target_id`.
///
/// Элементы между двумя позициями сдвигаются на один слот, остальные
/// остаются на месте. `None`, если id совпадают или одного из них нет.
pub fn move_by_id(
    order: &[PricingCategory],
    source_id: PricingCategoryId,
    target_id: PricingCategoryId,
) -> Option<Vec<PricingCategory>> {
    if source_id == target_id {
        return None;
    }
    let from = position_of(order, source_id)?;
    let to = position_of(order, target_id)?;

    let mut moved = order.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Some(moved)
}

/// Плотная нумерация: позиция `i` получает `sort_order = i + 1`.
/// Пересчитываются все элементы, не только перемещенный.
pub fn dense_sort_orders(order: &[PricingCategory]) -> Vec<SortOrderAssignment> {
    order
        .iter()
        .enumerate()
        .map(|(index, c)| SortOrderAssignment {
            id: c.id,
            sort_order: index as i32 + 1,
        })
        .collect()
}

/// Полный план перестановки. В возвращаемом порядке `sort_order`
/// уже совпадает с позицией, чтобы экран показывал новые номера сразу.
pub fn plan_reorder(
    order: &[PricingCategory],
    source_id: PricingCategoryId,
    target_id: PricingCategoryId,
) -> Option<ReorderPlan> {
    let mut moved = move_by_id(order, source_id, target_id)?;
    let assignments = dense_sort_orders(&moved);
    for (category, assignment) in moved.iter_mut().zip(&assignments) {
        category.sort_order = assignment.sort_order;
    }
    Some(ReorderPlan {
        order: moved,
        assignments,
    })
}

/// Каноническая сортировка списка с сервера: по `sort_order`, затем по имени.
/// Дубликаты `sort_order` допустимы и не ломают порядок.
pub fn sort_for_display(categories: &mut [PricingCategory]) {
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_pricing_category::aggregate::PricingCategoryDto;
    use std::collections::HashSet;

    fn categories(names: &[&str]) -> Vec<PricingCategory> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                PricingCategory::new_for_insert(
                    PricingCategoryDto {
                        name: name.to_string(),
                        ..Default::default()
                    },
                    i as i32 + 1,
                )
            })
            .collect()
    }

    fn names(order: &[PricingCategory]) -> Vec<&str> {
        order.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_drag_last_to_first() {
        let list = categories(&["A", "B", "C"]);
        let plan = plan_reorder(&list, list[2].id, list[0].id).unwrap();

        assert_eq!(names(&plan.order), vec!["C", "A", "B"]);
        assert_eq!(
            plan.assignments,
            vec![
                SortOrderAssignment { id: list[2].id, sort_order: 1 },
                SortOrderAssignment { id: list[0].id, sort_order: 2 },
                SortOrderAssignment { id: list[1].id, sort_order: 3 },
            ]
        );
    }

    #[test]
    fn test_drag_down_lands_on_target_position() {
        let list = categories(&["A", "B", "C", "D", "E"]);
        let moved = move_by_id(&list, list[0].id, list[3].id).unwrap();

        assert_eq!(names(&moved), vec!["B", "C", "D", "A", "E"]);
        // перемещенный элемент занимает исходную позицию цели
        assert_eq!(moved[3].id, list[0].id);
    }

    #[test]
    fn test_move_preserves_set_and_relative_order() {
        let list = categories(&["A", "B", "C", "D", "E", "F"]);
        for from in 0..list.len() {
            for to in 0..list.len() {
                if from == to {
                    continue;
                }
                let moved = move_by_id(&list, list[from].id, list[to].id).unwrap();
                assert_eq!(moved.len(), list.len());

                let before: HashSet<_> = list.iter().map(|c| c.id).collect();
                let after: HashSet<_> = moved.iter().map(|c| c.id).collect();
                assert_eq!(before, after);

                assert_eq!(moved[to].id, list[from].id);

                let others_before: Vec<_> =
                    list.iter().filter(|c| c.id != list[from].id).map(|c| c.id).collect();
                let others_after: Vec<_> =
                    moved.iter().filter(|c| c.id != list[from].id).map(|c| c.id).collect();
                assert_eq!(others_before, others_after);
            }
        }
    }

    #[test]
    fn test_same_id_is_noop() {
        let list = categories(&["A", "B"]);
        assert!(plan_reorder(&list, list[0].id, list[0].id).is_none());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let list = categories(&["A", "B"]);
        let stranger = PricingCategoryId::new_v4();
        assert!(plan_reorder(&list, stranger, list[0].id).is_none());
        assert!(plan_reorder(&list, list[1].id, stranger).is_none());
    }

    #[test]
    fn test_dense_renumbering_covers_every_position() {
        let mut list = categories(&["A", "B", "C", "D"]);
        // рваная нумерация после удалений
        for (c, n) in list.iter_mut().zip([3, 7, 7, 20]) {
            c.sort_order = n;
        }
        let plan = plan_reorder(&list, list[1].id, list[3].id).unwrap();

        let mut values: Vec<i32> = plan.assignments.iter().map(|a| a.sort_order).collect();
        values.sort();
        assert_eq!(values, vec![1, 2, 3, 4]);
        for (index, category) in plan.order.iter().enumerate() {
            assert_eq!(category.sort_order, index as i32 + 1);
        }
    }

    #[test]
    fn test_sort_for_display_tolerates_ties() {
        let mut list = categories(&["b", "A", "c"]);
        list[0].sort_order = 2;
        list[1].sort_order = 2;
        list[2].sort_order = 1;
        sort_for_display(&mut list);
        assert_eq!(names(&list), vec!["c", "A", "b"]);
    }
}
