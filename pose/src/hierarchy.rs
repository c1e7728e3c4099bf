use crate::error::HierarchyError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Reaches,
}

/// Checks that `parent_indices` describes a single tree.
///
/// Returns index of the root node.
pub fn validate_parent_indices(
    parent_indices: &[Option<usize>],
) -> Result<usize, HierarchyError> {
    let count = parent_indices.len();
    if count == 0 {
        return Err(HierarchyError::Empty);
    }

    let mut root = None;
    for (index, parent) in parent_indices.iter().enumerate() {
        match *parent {
            None => match root {
                None => root = Some(index),
                Some(first) => {
                    return Err(HierarchyError::MultipleRoots {
                        first,
                        second: index,
                    })
                }
            },
            Some(parent) if parent >= count => {
                return Err(HierarchyError::ParentOutOfRange {
                    index,
                    parent,
                    count,
                })
            }
            Some(parent) if parent == index => {
                return Err(HierarchyError::SelfParent { index })
            }
            Some(_) => {}
        }
    }

    let root = root.ok_or(HierarchyError::NoRoot)?;

    // Single root with in-range parents. Remaining failure is a cycle
    // detached from the root.
    let mut visits = vec![Visit::Unvisited; count];
    visits[root] = Visit::Reaches;
    let mut chain = Vec::new();

    for start in 0..count {
        let mut index = start;
        while visits[index] == Visit::Unvisited {
            visits[index] = Visit::InProgress;
            chain.push(index);
            // Only the root has no parent and it is already marked.
            index = parent_indices[index].unwrap_or(root);
        }

        if visits[index] == Visit::InProgress {
            return Err(HierarchyError::Cycle { index });
        }

        for index in chain.drain(..) {
            visits[index] = Visit::Reaches;
        }
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tree() {
        assert_eq!(
            validate_parent_indices(&[None, Some(0), Some(0), Some(1)]),
            Ok(0)
        );
    }

    #[test]
    fn accepts_root_anywhere() {
        assert_eq!(validate_parent_indices(&[Some(2), Some(0), None]), Ok(2));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(validate_parent_indices(&[]), Err(HierarchyError::Empty));
    }

    #[test]
    fn rejects_missing_root() {
        assert_eq!(
            validate_parent_indices(&[Some(1), Some(0)]),
            Err(HierarchyError::NoRoot)
        );
    }

    #[test]
    fn rejects_second_root() {
        assert_eq!(
            validate_parent_indices(&[None, Some(0), None]),
            Err(HierarchyError::MultipleRoots {
                first: 0,
                second: 2
            })
        );
    }

    #[test]
    fn rejects_out_of_range_parent() {
        assert_eq!(
            validate_parent_indices(&[None, Some(5)]),
            Err(HierarchyError::ParentOutOfRange {
                index: 1,
                parent: 5,
                count: 2
            })
        );
    }

    #[test]
    fn rejects_self_parent() {
        assert_eq!(
            validate_parent_indices(&[None, Some(1)]),
            Err(HierarchyError::SelfParent { index: 1 })
        );
    }

    #[test]
    fn rejects_detached_cycle() {
        assert_eq!(
            validate_parent_indices(&[None, Some(2), Some(3), Some(1)]),
            Err(HierarchyError::Cycle { index: 1 })
        );
    }
}
