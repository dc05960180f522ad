//! # Reference behavior nodes.
//!
//! A small node library implementing the [`Node`](crate::Node) contract, used
//! by the tests and the demo. Every node is an explicit state machine.
//!
//! | Node                   | Encloses                          | Result                                   |
//! |------------------------|-----------------------------------|------------------------------------------|
//! | [`succeed`]            | nothing                           | `Success`                                |
//! | [`fail`]               | nothing                           | `Failure`                                |
//! | [`fail_after`]         | named `after`                     | `Running` × `after`, then `Failure`      |
//! | [`log`]                | positional `message`              | `Success` (message logged)               |
//! | [`sequence`]           | positional children               | first `Failure`, else `Success`          |
//! | [`selector`]           | positional children               | first `Success`, else `Failure`          |
//! | [`parallel`]           | positional children               | `Success` if every child succeeded       |
//! | [`repeat_always`]      | positional child                  | never finishes                           |
//! | [`repeat_until_fail`]  | positional child                  | `Success` once the child fails           |
//! | [`repeat_until_succeed`]| positional child                 | `Success` once the child succeeds        |
//! | [`set_bb`]             | named `key`, `val`; blackboard    | `Success`                                |
//! | [`check_bb`]           | named `key`, `check`; blackboard  | predicate result                         |

mod blackboard;
mod composite;
mod leaf;

pub use blackboard::{Blackboard, check_bb, set_bb};
pub use composite::{
    Composite, CompositeKind, parallel, repeat_always, repeat_until_fail, repeat_until_succeed,
    selector, sequence,
};
pub use leaf::{fail, fail_after, log, succeed};
