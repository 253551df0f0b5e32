use actix_web::web::{Data, Json, Path};
use chrono::Utc;

use crate::core::models::ballot::Submit;
use crate::core::ports::repository::Manager;
use crate::core::services::ballot;
use crate::error::Error;
use crate::response::Message;

pub async fn submit<M>(code_id: Path<(i32,)>, Json(Submit { selections }): Json<Submit>, manager: Data<M>) -> Result<Json<Message<()>>, Error>
where
    M: Manager + 'static,
{
    let (code_id,) = code_id.into_inner();
    let tx = manager.tx().await?;
    ballot::submit(tx, code_id, &selections, Utc::now()).await?;
    Ok(Json(Message::new("Vote submitted successfully.", None)))
}
