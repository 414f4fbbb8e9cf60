use rocket::Route;

mod chaincode;

pub use chaincode::ChaincodeInput;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(chaincode::routes());
    routes
}
