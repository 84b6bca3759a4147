mod delete_flow;
mod list_controller;
mod list_view;

pub use delete_flow::{ConfirmedDelete, DeleteFlow, DeleteState};
pub use list_controller::{ListController, RefreshRequest};
pub use list_view::{
    derive, FilterPatch, FilterState, ListItem, SortDirection, SortState, SortValue,
};

use crate::services::{
    AdmissionService, BillService, BookListService, JobPostService, ReceiptService, StudentService,
};

pub type AdmissionsScreen = ListController<AdmissionService>;
pub type BookListsScreen = ListController<BookListService>;
pub type JobPostsScreen = ListController<JobPostService>;
pub type BillsScreen = ListController<BillService>;
pub type ReceiptsScreen = ListController<ReceiptService>;
pub type StudentsScreen = ListController<StudentService>;
