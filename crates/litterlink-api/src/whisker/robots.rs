// Whisker Litter-Robot 4 queries

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::whisker::client::{Surface, WhiskerClient};
use crate::whisker::models::{RobotActivity, WhiskerRobot};

const ROBOTS_BY_USER: &str = "query GetLR4($userId: String!) { \
    getLitterRobot4ByUser(userId: $userId) { \
    serial name litterLevel DFILevelPercent isDFIFull robotStatus } }";

const ROBOT_ACTIVITY: &str = "query GetActivity($serial: String!, $limit: Int) { \
    getLitterRobot4Activity(serial: $serial, limit: $limit) { timestamp value actionValue } }";

impl WhiskerClient {
    /// Litter-Robot 4 units with their current sensor readings.
    pub async fn robots(&self) -> Result<Vec<WhiskerRobot>, Error> {
        let user_id = self.user_id()?;
        debug!(user_id, "fetching robots");
        self.query_list(
            Surface::Robot,
            "getLitterRobot4ByUser",
            ROBOTS_BY_USER,
            json!({ "userId": user_id }),
        )
        .await
    }

    /// Most recent `limit` activity entries for one robot.
    pub async fn robot_activity(
        &self,
        serial: &str,
        limit: u32,
    ) -> Result<Vec<RobotActivity>, Error> {
        debug!(serial, limit, "fetching robot activity");
        self.query_list(
            Surface::Robot,
            "getLitterRobot4Activity",
            ROBOT_ACTIVITY,
            json!({ "serial": serial, "limit": limit }),
        )
        .await
    }
}
