// Request handlers, one module per resource.
//
// Every handler follows the same sequence: authenticate (middleware) ->
// validate -> execute against the ownership-scoped repository -> translate
// errors -> envelope. Handlers return Result and never write wire bodies
// directly; `ApiError` and `ApiResponse` own the formats.

pub mod auth;
pub mod customers;
pub mod orders;
pub mod profile;
pub mod todos;
