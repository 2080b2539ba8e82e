//! Bindings for the deployed crowdfunding contract.

use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    contract Crowdfunding {
        event CampaignCreated(uint256 campaignId, address indexed creator, uint256 goal, uint256 deadline);
        event Pledged(uint256 indexed campaignId, address indexed backer, uint256 amount);
        event Withdrawn(uint256 indexed campaignId, address indexed creator, uint256 amount);
        event Refunded(uint256 indexed campaignId, address indexed backer, uint256 amount);

        function createCampaign(uint256 _goal, uint256 _duration) public;
        function getCampaign(uint256 _campaignId) public view returns (address, uint256, uint256, uint256, bool);
        function pledge(uint256 _campaignId) public payable;
        function withdraw(uint256 _campaignId) public;
        function refund(uint256 _campaignId) public;
    }
}
